/// Fallible conversion that has to await I/O, such as loading a value from a
/// file on disk.
pub trait AsyncTryFrom<T>: Sized {
    type Error;

    async fn async_try_from(value: T) -> Result<Self, Self::Error>;
}

/// Reciprocal of [`AsyncTryFrom`], implemented for every type it covers.
pub trait AsyncTryInto<T> {
    type Error;

    async fn async_try_into(self) -> Result<T, Self::Error>;
}

impl<T, U> AsyncTryInto<U> for T
where
    U: AsyncTryFrom<T>,
{
    type Error = U::Error;

    async fn async_try_into(self) -> Result<U, Self::Error> {
        U::async_try_from(self).await
    }
}
