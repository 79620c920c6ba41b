/// Chat lexer: splits sanitized text into borrowed tokens.
pub mod lexer;
