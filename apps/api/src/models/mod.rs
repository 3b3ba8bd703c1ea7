pub mod certificate;
pub mod letter;
