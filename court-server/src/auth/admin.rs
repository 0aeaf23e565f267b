//! 管理员凭据
//!
//! 单一共享 PIN，以 argon2 PHC 字符串持久化。未持久化时首次使用会从
//! `ADMIN_PIN` 环境变量写入；之后 (包括轮换后) 环境变量不再生效。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::AdminRepository;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Minimum length of a new credential, which may not contain spaces
pub const MIN_ADMIN_PIN_LEN: usize = 4;

/// Hash a PIN using argon2
fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pin.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a PIN against a stored PHC string
fn verify_pin(pin: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok())
}

fn hash_error(e: argon2::password_hash::Error) -> AppError {
    AppError::internal(format!("Admin credential hashing failed: {}", e))
}

pub struct AdminService {
    repo: AdminRepository,
    env_pin: Option<String>,
}

impl AdminService {
    pub fn new(repo: AdminRepository, env_pin: Option<String>) -> Self {
        let env_pin = env_pin
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self { repo, env_pin }
    }

    /// Persist the environment credential when nothing is stored yet
    pub fn seed(&self) -> AppResult<()> {
        if self.stored_hash()?.is_none() {
            tracing::warn!("No admin credential configured, admin endpoints are locked");
        }
        Ok(())
    }

    /// Stored hash, writing the environment credential first if needed
    fn stored_hash(&self) -> AppResult<Option<String>> {
        if let Some(stored) = self.repo.pin_hash()? {
            return Ok(Some(stored));
        }
        let Some(pin) = &self.env_pin else {
            return Ok(None);
        };
        let hash = hash_pin(pin).map_err(hash_error)?;
        self.repo.set_pin_hash(&hash)?;
        tracing::info!("Admin credential seeded from environment");
        Ok(Some(hash))
    }

    /// `false` also when no credential exists at all
    pub fn verify(&self, pin: &str) -> AppResult<bool> {
        let pin = pin.trim();
        if pin.is_empty() {
            return Ok(false);
        }
        match self.stored_hash()? {
            Some(stored) => verify_pin(pin, &stored).map_err(|e| {
                tracing::error!(error = %e, "Stored admin credential is not a valid PHC string");
                hash_error(e)
            }),
            None => Ok(false),
        }
    }

    /// Replace the credential; the caller has already verified the current one
    pub fn rotate(&self, new_pin: &str) -> AppResult<()> {
        let trimmed = new_pin.trim();
        if trimmed.chars().count() < MIN_ADMIN_PIN_LEN || trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                format!(
                    "Admin PIN must be at least {} non-space characters",
                    MIN_ADMIN_PIN_LEN
                ),
            ));
        }
        let hash = hash_pin(trimmed).map_err(hash_error)?;
        self.repo.set_pin_hash(&hash)?;
        tracing::info!("Admin credential rotated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn service(env_pin: Option<&str>) -> AdminService {
        let db = DbService::open_in_memory().unwrap();
        AdminService::new(AdminRepository::new(db), env_pin.map(str::to_string))
    }

    #[test]
    fn test_env_pin_until_rotation() {
        let admin = service(Some(" 9999 "));
        assert!(admin.verify("9999").unwrap());
        assert!(!admin.verify("0000").unwrap());

        admin.rotate("2468").unwrap();
        assert!(admin.verify("2468").unwrap());
        assert!(!admin.verify("9999").unwrap());
    }

    #[test]
    fn test_no_credential_rejects_everything() {
        let admin = service(Some("   "));
        admin.seed().unwrap();
        assert!(!admin.verify("").unwrap());
        assert!(!admin.verify("1234").unwrap());
    }

    #[test]
    fn test_seed_persists_salted_hash_once() {
        let db = DbService::open_in_memory().unwrap();
        let repo = AdminRepository::new(db.clone());
        AdminService::new(repo.clone(), Some("1111".into())).seed().unwrap();
        let seeded = repo.pin_hash().unwrap().unwrap();
        assert!(seeded.starts_with("$argon2"));
        assert!(!seeded.contains("1111"));

        // A later start with a different env value keeps the stored one
        let admin = AdminService::new(repo.clone(), Some("2222".into()));
        admin.seed().unwrap();
        assert_eq!(repo.pin_hash().unwrap().unwrap(), seeded);
        assert!(admin.verify("1111").unwrap());
        assert!(!admin.verify("2222").unwrap());
    }

    #[test]
    fn test_same_pin_hashes_differently() {
        let a = hash_pin("court-42").unwrap();
        let b = hash_pin("court-42").unwrap();
        assert_ne!(a, b);
        assert!(verify_pin("court-42", &a).unwrap());
        assert!(verify_pin("court-42", &b).unwrap());
        assert!(!verify_pin("court-43", &a).unwrap());
    }

    #[test]
    fn test_corrupt_stored_hash_is_an_error() {
        let db = DbService::open_in_memory().unwrap();
        let repo = AdminRepository::new(db);
        repo.set_pin_hash("not-a-phc-string").unwrap();
        let admin = AdminService::new(repo, None);
        assert_eq!(admin.verify("1234").unwrap_err().code, ErrorCode::InternalError);
    }

    #[test]
    fn test_rotate_requires_length() {
        let admin = service(Some("9999"));
        assert_eq!(
            admin.rotate(" 1 2 ").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert!(admin.verify("9999").unwrap());
    }
}
