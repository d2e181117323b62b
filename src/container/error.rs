#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container id must not be empty")]
    EmptyContainerID,
    #[error("an exclusion policy has already been bound for this process")]
    PolicyAlreadyInstalled,
}
pub type Result<T> = std::result::Result<T, Error>;
