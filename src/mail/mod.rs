pub mod decoders;
#[cfg(test)]
pub(crate) mod fake;
pub mod imap_client;
pub mod parser;
