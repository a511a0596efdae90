pub mod getpub;
pub mod keygen;
pub mod sign_digest;
pub mod version;

pub use getpub::Getpub;
pub use keygen::Keygen;
pub use sign_digest::SignDigest;
pub use version::Version;
