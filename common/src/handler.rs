//! [`Handler`] abstraction.

use std::future::Future;

/// Handler of some arguments, producing a [`Result`] asynchronously.
pub trait Handler<Args = ()> {
    /// Success value of this [`Handler`].
    type Ok;

    /// Error value of this [`Handler`].
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
