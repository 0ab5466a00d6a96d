/// Hard post length limit of the posting platform.
pub const POST_MAX_LEN: usize = 280;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooLong {
    pub limit: usize,
    pub actual: usize,
}

/// Length of `text` as the posting platform counts it.
///
/// Counts Unicode scalar values. The live platform weights some ranges (URLs,
/// CJK) differently, so this can accept text the API later refuses.
pub fn post_len(text: &str) -> usize {
    text.chars().count()
}

pub fn validate(text: &str) -> Result<(), TooLong> {
    validate_with_limit(text, POST_MAX_LEN)
}

pub fn validate_with_limit(text: &str, limit: usize) -> Result<(), TooLong> {
    let actual = post_len(text);
    if actual > limit {
        return Err(TooLong { limit, actual });
    }
    Ok(())
}
