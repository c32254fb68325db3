pub mod sso;
