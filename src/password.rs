use std::time::{Duration, Instant};

use sha2::{Digest, Sha512};

use crate::errors::*;
use crate::models::Password;

pub const HASH_BYTES: usize = 24;
pub const SALT_BYTES: usize = 16;

#[derive(Clone, Copy)]
pub struct HashedPassword {
    hash: [u8; HASH_BYTES],
    salt: [u8; SALT_BYTES],
    initial_rounds: i16,
    extra_rounds: i16,
}

impl From<Password> for HashedPassword {
    fn from(db_password: Password) -> Self {
        let mut hash = [0_u8; HASH_BYTES];
        let mut salt = [0_u8; SALT_BYTES];
        hash[..].clone_from_slice(&db_password.password_hash[..]);
        salt[..].clone_from_slice(&db_password.salt[..]);
        HashedPassword {
            hash,
            salt,
            initial_rounds: db_password.initial_rounds,
            extra_rounds: db_password.extra_rounds,
        }
    }
}

impl HashedPassword {
    pub fn into_db(self, user_id: i32) -> Password {
        Password {
            id: user_id,
            password_hash: (&self.hash[..]).into(),
            salt: (&self.salt[..]).into(),
            initial_rounds: self.initial_rounds,
            extra_rounds: self.extra_rounds,
        }
    }
}

fn fixed_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// One strengthening step: 2^cost chained SHA-512 invocations over the
/// previous state and the salt, truncated to the stored hash width.
fn hash_round(cost: i16, salt: &[u8; SALT_BYTES], input: &[u8], output: &mut [u8; HASH_BYTES]) {
    let mut state = [0_u8; 64];
    let mut hasher = Sha512::new();
    hasher.update(input);
    hasher.update(&salt[..]);
    state.copy_from_slice(&hasher.finalize());
    for _ in 1..(1_u32 << cost as u32) {
        let mut hasher = Sha512::new();
        hasher.update(&state[..]);
        hasher.update(&salt[..]);
        state.copy_from_slice(&hasher.finalize());
    }
    output.copy_from_slice(&state[..HASH_BYTES]);
}

fn pepper_salt_pw_hash(plaintext_pw: &str,
                       salt: [u8; SALT_BYTES],
                       initial_rounds: i16,
                       runtime_pepper: &[u8])
                       -> HashedPassword {
    let mut hasher = Sha512::new();
    hasher.update(plaintext_pw.as_bytes());
    hasher.update(runtime_pepper);
    let peppered_pw = hasher.finalize();

    let mut output_hash = [0_u8; HASH_BYTES];
    hash_round(initial_rounds, &salt, &peppered_pw, &mut output_hash);
    HashedPassword {
        hash: output_hash,
        salt,
        initial_rounds,
        extra_rounds: 0,
    }
}

pub fn set_password(plaintext_pw: &str,
                    pepper: &[u8],
                    stretch_time: Duration)
                    -> Result<HashedPassword> {
    use rand::rngs::OsRng;
    use rand::RngCore;

    if plaintext_pw.len() < 8 {
        return Err(ErrorKind::PasswordTooShort.into());
    };
    if plaintext_pw.len() > 1024 {
        return Err(ErrorKind::PasswordTooLong.into());
    };

    let mut salt = [0_u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);

    let mut rounds = 10;
    let start_time = Instant::now();
    let mut hashed_pw = pepper_salt_pw_hash(plaintext_pw, salt, rounds, pepper);
    let mut elapsed = Instant::now().duration_since(start_time);

    while elapsed < stretch_time {
        debug!("Not enough time elapsed ({:?}). Stretching more.", elapsed);
        rounds += 1;
        let start_time = Instant::now();
        hashed_pw = pepper_salt_pw_hash(plaintext_pw, salt, rounds, pepper);
        elapsed = Instant::now().duration_since(start_time);
    }

    Ok(hashed_pw)
}

pub fn stretch_password(strength_goal: i16, hashed_pw: HashedPassword) -> HashedPassword {
    // We can regard the password hash as the output of the original creation function.
    let mut output_hash = hashed_pw.hash;
    let mut extra_rounds = hashed_pw.extra_rounds;

    while hashed_pw.initial_rounds + extra_rounds < strength_goal {
        let input = output_hash;
        hash_round(hashed_pw.initial_rounds + extra_rounds,
                   &hashed_pw.salt,
                   &input,
                   &mut output_hash);
        extra_rounds += 1;
    }
    HashedPassword {
        hash: output_hash,
        salt: hashed_pw.salt,
        initial_rounds: hashed_pw.initial_rounds,
        extra_rounds,
    }
}

pub fn check_password(plaintext_pw: &str,
                      pw_from_db: HashedPassword,
                      pepper: &[u8])
                      -> Result<()> {
    let init_hash = pepper_salt_pw_hash(plaintext_pw,
                                        pw_from_db.salt,
                                        pw_from_db.initial_rounds,
                                        pepper);
    let stretched_pw = stretch_password(pw_from_db.initial_rounds + pw_from_db.extra_rounds,
                                        init_hash);

    if fixed_time_eq(&stretched_pw.hash, &pw_from_db.hash) {
        Ok(())
    } else {
        Err(ErrorKind::PasswordDoesntMatch.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::time::Duration;

    fn pepper() -> [u8; 32] {
        let mut pepper = [0_u8; 32];
        rand::thread_rng().fill_bytes(&mut pepper);
        pepper
    }

    #[test]
    fn test_set_check_password() {
        let pepper = pepper();
        let pw = set_password("password", &pepper, Duration::from_millis(0)).unwrap();
        check_password("password", pw, &pepper).expect("Passwords should match!");
    }

    #[test]
    fn test_set_check_wrong_password() {
        let pepper = pepper();
        let pw = set_password("password1", &pepper, Duration::from_millis(0)).unwrap();
        if let Ok(()) = check_password("password2", pw, &pepper) {
            panic!("Passwords shouldn't match!");
        }
    }

    #[test]
    fn test_too_short_password() {
        let pepper = pepper();
        match set_password("seven77", &pepper, Duration::from_millis(0)) {
            Err(Error(ErrorKind::PasswordTooShort, _)) => (),
            _ => panic!("A 7-byte password should be rejected!"),
        }
    }

    #[test]
    fn test_set_stretch_password_converges() {
        let pepper = pepper();

        let init_pw = set_password("daggerfish", &pepper, Duration::from_millis(0)).unwrap();
        let stretched_pw_0 = stretch_password(11, init_pw);
        let stretched_pw_1 = stretch_password(12, stretched_pw_0);
        let stretched_pw_2 = stretch_password(12, init_pw);

        assert_eq!(stretched_pw_1.hash, stretched_pw_2.hash);
        assert_eq!(stretched_pw_1.extra_rounds, stretched_pw_2.extra_rounds);
    }

    #[test]
    fn test_stretch_to_current_strength_is_noop() {
        let pepper = pepper();

        let init_pw_1 = set_password("swordfish", &pepper, Duration::from_millis(0)).unwrap();
        let init_pw_2 = stretch_password(10, init_pw_1);

        assert_eq!(init_pw_1.hash, init_pw_2.hash);
        assert_eq!(0, init_pw_2.extra_rounds);
    }

    #[test]
    fn test_set_stretch_check_password() {
        let pepper = pepper();

        let init_pw = set_password("miekkakala", &pepper, Duration::from_millis(0)).unwrap();
        let stretched_pw = stretch_password(11, init_pw);

        check_password("miekkakala", stretched_pw, &pepper).expect("Passwords should match!");
    }

    #[test]
    fn test_set_stretch_check_wrong_password() {
        let pepper = pepper();

        let init_pw = set_password("miekkakala", &pepper, Duration::from_millis(0)).unwrap();
        let stretched_pw = stretch_password(11, init_pw);

        if let Ok(()) = check_password("tikarikala", stretched_pw, &pepper) {
            panic!("Passwords shouldn't match!");
        }
    }
}
