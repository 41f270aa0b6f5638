//! Conversion of foreign error types into the `String` errors used across the
//! runtime and by user-supplied callbacks.

use std::fmt::Display;

pub trait ErrorStringExt<T> {
    /// Replace the error with `"{context}: {error}"`.
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E: Display> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|err| format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorStringExt;

    #[test]
    fn test_err_to_string_prefixes_context() {
        let res: Result<u8, String> = "abc".parse::<u8>().err_to_string("could not parse slot");
        let msg = res.unwrap_err();
        assert!(msg.starts_with("could not parse slot: "));
        assert!(msg.len() > "could not parse slot: ".len());
    }

    #[test]
    fn test_err_to_string_keeps_ok() {
        let res = "7".parse::<u8>().err_to_string("unused");
        assert_eq!(res, Ok(7));
    }
}
