use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("config: {0}")]
	Config(String),
	/// A codepoint override could not be accepted.
	#[error("invalid codepoint override {key}={value:?}: {reason}")]
	InvalidCodepoint { key: String, value: String, reason: String },
	/// Two emitted variants of the same capability class share a codepoint.
	#[error("duplicate {class} codepoint {codepoint:#06x}: {first} and {second}")]
	DuplicateCodepoint { class: &'static str, first: String, second: String, codepoint: u32 },
	#[error("descriptor {name}: {reason}")]
	InvalidDescriptor { name: String, reason: String },
	#[error("provider already initialized")]
	AlreadyInitialized,
}

impl Error {
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }

	pub fn invalid_descriptor(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidDescriptor { name: name.into(), reason: reason.into() }
	}
}
