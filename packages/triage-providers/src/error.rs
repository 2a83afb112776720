pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider call timed out.")]
	Timeout,
	#[error(transparent)]
	Http(reqwest::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() { Self::Timeout } else { Self::Http(err) }
	}
}
impl Error {
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout)
	}
}
