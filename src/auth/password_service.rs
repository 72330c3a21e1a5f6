use bcrypt::{hash, verify};

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 5;

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidInput {
            reason: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(hash(password, HASH_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(verify(password, hash)?)
}
