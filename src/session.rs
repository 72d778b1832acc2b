use super::*;

use chrono::Utc;
use data_encoding::BASE64URL_NOPAD;
use diesel::pg::PgConnection;
use diesel::prelude::*;

pub const SESSID_BITS: usize = 128;

pub fn fresh_token() -> Result<[u8; SESSID_BITS / 8]> {
    use rand::rngs::OsRng;
    use rand::RngCore;

    let mut token = [0_u8; SESSID_BITS / 8];
    OsRng.fill_bytes(&mut token);
    Ok(token)
}

pub fn to_base64(sess: &Session) -> String {
    BASE64URL_NOPAD.encode(&sess.sess_token)
}

fn token_to_bin(token_b64: &str) -> Result<Vec<u8>> {
    if token_b64.len() != BASE64URL_NOPAD.encode_len(SESSID_BITS / 8) {
        return Err(ErrorKind::BadSessId.into());
    }
    BASE64URL_NOPAD.decode(token_b64.as_bytes())
        .map_err(|_| ErrorKind::BadSessId.into())
}

pub fn start(conn: &mut PgConnection, user: &User) -> Result<Session> {
    use crate::schema::{sessions, users};

    let token = fresh_token()?;

    let new_sess = NewSession {
        user_id: user.id,
        sess_token: &token[..],
    };

    let sess: Session = diesel::insert_into(sessions::table)
        .values(&new_sess)
        .get_result(conn)
        .chain_err(|| "Couldn't start a session!")?;

    diesel::update(users::table.filter(users::id.eq(user.id)))
        .set(users::last_seen.eq(Utc::now()))
        .execute(conn)?;

    Ok(sess)
}

/// Looks the token up and refreshes the session's last_seen stamp.
pub fn check(conn: &mut PgConnection, token_b64: &str) -> Result<Option<(User, Session)>> {
    use crate::schema::{sessions, users};
    use diesel::SaveChangesDsl;

    let token = token_to_bin(token_b64)?;

    let user_sess: Option<(User, Session)> = users::table
        .inner_join(sessions::table)
        .filter(sessions::sess_token.eq(&token))
        .get_result(conn)
        .optional()?;

    if let Some((user, mut sess)) = user_sess {
        sess.last_seen = Utc::now();
        let sess: Session = sess.save_changes(conn)?;
        Ok(Some((user, sess)))
    } else {
        Ok(None)
    }
}

pub fn end(conn: &mut PgConnection, token_b64: &str) -> Result<Option<()>> {
    use crate::schema::sessions;

    let token = token_to_bin(token_b64)?;

    let deleted_count = diesel::delete(sessions::table
            .filter(sessions::sess_token.eq(&token)))
        .execute(conn)?;

    Ok(if deleted_count != 1 {
        warn!("Somebody tried to log out with a stale or bogus token.");
        None
    } else {
        Some(())
    })
}

pub fn clean_old_sessions(conn: &mut PgConnection, how_old: chrono::Duration) -> Result<usize> {
    use crate::schema::sessions;

    let deleted_count = diesel::delete(sessions::table
            .filter(sessions::last_seen.lt(Utc::now() - how_old)))
        .execute(conn)?;

    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tokens_differ() {
        let a = fresh_token().unwrap();
        let b = fresh_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_base64_shape() {
        let token = fresh_token().unwrap();
        let encoded = BASE64URL_NOPAD.encode(&token);
        assert_eq!(token.to_vec(), token_to_bin(&encoded).unwrap());
    }

    #[test]
    fn test_bad_token_rejected() {
        match token_to_bin("nonsense") {
            Err(Error(ErrorKind::BadSessId, _)) => (),
            _ => panic!("A short token should be rejected!"),
        }
    }
}
