use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};

/// Injectable random-suffix source backing charge-code generation.
#[automock]
pub trait CodeSource: Send + Sync {
    fn alphanumeric(&self, len: usize) -> String;
    fn digits(&self, len: usize) -> String;
}

#[derive(Debug, Default)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn alphanumeric(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    fn digits(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_emits_only_digits_of_requested_length() {
        let source = RandomCodeSource;
        let value = source.digits(10);
        assert_eq!(value.len(), 10);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn alphanumeric_emits_only_alnum_of_requested_length() {
        let source = RandomCodeSource;
        let value = source.alphanumeric(20);
        assert_eq!(value.len(), 20);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
