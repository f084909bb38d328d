//! Local account id validation.
//!
//! Rejecting malformed ids before any network call keeps RPC errors for
//! problems that actually involve the node.

use crate::chain::Chain;

const NEAR_MIN_LEN: usize = 2;
const NEAR_MAX_LEN: usize = 64;
const SOLANA_PUBKEY_LEN: usize = 32;

/// SS58 payload: 1 prefix byte + 32-byte key + 2 checksum bytes (2 prefix bytes
/// for network ids >= 64).
const SS58_LENGTHS: [usize; 2] = [35, 36];

/// Validate `account` in the native format of `chain`.
pub fn validate_account(chain: Chain, account: &str) -> Result<(), String> {
    if account.is_empty() {
        return Err("account id is empty".to_string());
    }
    match chain {
        Chain::Near => validate_near(account),
        Chain::Solana => validate_solana(account),
        Chain::Filecoin => validate_filecoin(account),
        Chain::Polkadot => validate_polkadot(account),
    }
}

fn validate_near(account: &str) -> Result<(), String> {
    // Implicit accounts: 64 lowercase hex characters.
    if account.len() == 64 && account.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return Ok(());
    }

    if !(NEAR_MIN_LEN..=NEAR_MAX_LEN).contains(&account.len()) {
        return Err(format!(
            "length must be between {} and {}",
            NEAR_MIN_LEN, NEAR_MAX_LEN
        ));
    }

    let mut previous_separator = true; // leading separator is invalid
    for c in account.chars() {
        match c {
            'a'..='z' | '0'..='9' => previous_separator = false,
            '.' | '-' | '_' => {
                if previous_separator {
                    return Err("separators must be surrounded by alphanumerics".to_string());
                }
                previous_separator = true;
            }
            other => return Err(format!("invalid character '{}'", other)),
        }
    }
    if previous_separator {
        return Err("account id cannot end with a separator".to_string());
    }
    Ok(())
}

fn validate_solana(account: &str) -> Result<(), String> {
    let bytes = bs58::decode(account)
        .into_vec()
        .map_err(|e| format!("not base58: {}", e))?;
    if bytes.len() != SOLANA_PUBKEY_LEN {
        return Err(format!(
            "public key must decode to {} bytes, got {}",
            SOLANA_PUBKEY_LEN,
            bytes.len()
        ));
    }
    Ok(())
}

fn validate_filecoin(account: &str) -> Result<(), String> {
    let mut chars = account.chars();
    match chars.next() {
        Some('f') | Some('t') => {}
        _ => return Err("address must start with 'f' (mainnet) or 't' (testnet)".to_string()),
    }
    match chars.next() {
        Some('0'..='4') => {}
        _ => return Err("protocol indicator must be 0-4".to_string()),
    }
    let payload = chars.as_str();
    if payload.is_empty() {
        return Err("address payload is empty".to_string());
    }
    if !payload.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("address payload must be alphanumeric".to_string());
    }
    Ok(())
}

fn validate_polkadot(account: &str) -> Result<(), String> {
    let bytes = bs58::decode(account)
        .into_vec()
        .map_err(|e| format!("not base58: {}", e))?;
    if !SS58_LENGTHS.contains(&bytes.len()) {
        return Err(format!(
            "SS58 address must decode to 35 or 36 bytes, got {}",
            bytes.len()
        ));
    }
    Ok(())
}
