use std::future::Future;

use rand::RngCore;

use crate::error::GroupError;

const MAX_ATTEMPTS: usize = 10;

/// Draw 32 random bits rendered as 8 uppercase hex characters, retrying
/// against the store's existence check. The pre-check is only an early
/// exit; the unique index on groups.invite_code closes the
/// check-then-insert race between concurrent creates.
pub async fn generate<F, Fut>(code_exists: F) -> Result<String, GroupError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, GroupError>>,
{
    for _ in 0..MAX_ATTEMPTS {
        let code = format!("{:08X}", rand::thread_rng().next_u32());
        if !code_exists(code.clone()).await? {
            return Ok(code);
        }
    }
    Err(GroupError::GenerationExhausted)
}
