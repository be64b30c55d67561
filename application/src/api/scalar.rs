//! Custom GraphQL scalar machinery.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Adaptor for `#[graphql(with = ..)]` attributes, representing the target
/// type as a string scalar through an intermediate `As` type.
///
/// Output goes through the [`Display`] impl of `As`, input through its
/// [`FromStr`] impl followed by a [`TryFrom`] conversion into the target
/// type, so the target type only needs [`AsRef`]`<As>` and
/// [`TryFrom`]`<As>` impls.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Renders the target type as a string scalar [`Value`], going through
    /// the [`Display`] impl of the `As` type.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of an [`InputValue`], going through the
    /// [`FromStr`] impl of the `As` type.
    ///
    /// # Errors
    ///
    /// If the [`InputValue`] is not a string, fails to parse as the `As`
    /// type, or is rejected by the [`TryFrom`] conversion into the target
    /// type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("always has a name");
        let s = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{name}`: expected string input \
                 value, found: {input}",
            )
        })?;
        let via = s.parse::<As>().map_err(|e| {
            format!("Cannot parse input scalar `{name}` from \"{s}\": {e}")
        })?;
        via.try_into()
            .map_err(|e| format!("Cannot parse input scalar `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`] one.
    ///
    /// # Errors
    ///
    /// If the token doesn't represent a [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}
