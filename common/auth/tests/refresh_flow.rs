use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use common_auth::{
    AuthError, FailureKind, JwtSettings, RefreshToken, TokenSigner, TokenSubject, DEFAULT_KID,
};
use common_crypto::{DataProtector, ProtectionKey, TimeLimitedProtector};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

const SECRET: &str = "refresh-flow-secret";

#[derive(Serialize)]
struct RawClaims<'a> {
    sub: String,
    uname: &'a str,
    tid: String,
    app: String,
    roles: &'a [String],
    active: bool,
    iss: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

fn settings() -> JwtSettings {
    JwtSettings::new(SECRET, "storelink", "storefront", 15).with_leeway(0)
}

fn subject() -> TokenSubject {
    TokenSubject {
        user_id: Uuid::new_v4(),
        username: "alice".to_string(),
        tenant_id: Uuid::new_v4(),
        application_id: Uuid::new_v4(),
        roles: vec!["power_user".to_string()],
        active: true,
    }
}

/// An access token for `who` that expired five minutes ago, signed with the
/// live key so only the expiry is wrong.
fn expired_access_token(who: &TokenSubject) -> String {
    let past = Utc::now() - Duration::minutes(5);
    let claims = RawClaims {
        sub: who.user_id.to_string(),
        uname: &who.username,
        tid: who.tenant_id.to_string(),
        app: who.application_id.to_string(),
        roles: &who.roles,
        active: who.active,
        iss: "storelink",
        aud: "storefront",
        exp: past.timestamp(),
        iat: (past - Duration::minutes(15)).timestamp(),
    };
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(DEFAULT_KID.to_string());
    encode(&header, &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("sign")
}

#[test]
fn refresh_flow_recovers_identity_and_reissues() {
    let signer = TokenSigner::new(settings());
    let verifier = signer.verifier();
    let protector = TimeLimitedProtector::new(DataProtector::new(ProtectionKey::generate()));
    let who = subject();

    // Login: mint the pair and hand the sealed refresh token to the client.
    // The persistence collaborator stores only the fingerprint.
    let refresh = RefreshToken::generate();
    let stored_fingerprint = refresh.fingerprint();
    let sealed = refresh
        .seal(&protector, Duration::hours(8))
        .expect("seal refresh token");

    // Later: the access token has expired. Normal validation must refuse it.
    let stale = expired_access_token(&who);
    let err = verifier.verify(&stale).expect_err("expired access token");
    assert_eq!(err.kind(), FailureKind::TokenExpired);

    // Refresh: the explicitly named relaxed validation recovers the
    // identity, and the presented refresh token must match the stored one.
    let principal = verifier
        .verify_ignoring_expiry(&stale)
        .expect("recover identity");
    let identity = principal.identity().expect("identity");
    assert_eq!(identity.user_id, who.user_id);
    assert_eq!(identity.tenant_id, who.tenant_id);

    let presented = RefreshToken::open(&protector, &sealed).expect("open sealed token");
    assert_eq!(presented.fingerprint(), stored_fingerprint);

    // Reissue for the recovered identity; the new token authenticates.
    let reissued = signer
        .issue_access_token(&TokenSubject {
            user_id: identity.user_id,
            username: identity.username.clone(),
            tenant_id: identity.tenant_id,
            application_id: identity.application_id,
            roles: identity.roles.clone(),
            active: identity.active,
        })
        .expect("reissue");
    let fresh = verifier.verify(&reissued.token).expect("fresh token");
    assert_eq!(fresh.tenant_id().expect("tid"), identity.tenant_id);
}

#[test]
fn zero_minute_tokens_expire_within_a_second() {
    let signer = TokenSigner::new(JwtSettings::new(SECRET, "storelink", "storefront", 0).with_leeway(0));
    let verifier = signer.verifier();
    let who = subject();
    let issued = signer.issue_access_token(&who).expect("issue");

    thread::sleep(StdDuration::from_millis(1100));

    let err = verifier.verify(&issued.token).expect_err("expired");
    assert!(matches!(err, AuthError::Expired));

    let principal = verifier
        .verify_ignoring_expiry(&issued.token)
        .expect("relaxed validation");
    assert_eq!(principal.username().expect("uname"), who.username);
    assert_eq!(principal.user_id().expect("sub"), who.user_id);
}

#[test]
fn sealed_refresh_token_expires_with_its_wrapper() {
    let protector = TimeLimitedProtector::new(DataProtector::new(ProtectionKey::generate()));
    let refresh = RefreshToken::generate();
    let sealed = refresh
        .seal(&protector, Duration::milliseconds(300))
        .expect("seal");

    assert_eq!(
        RefreshToken::open(&protector, &sealed).expect("still fresh"),
        refresh
    );

    thread::sleep(StdDuration::from_millis(400));
    assert!(RefreshToken::open(&protector, &sealed).is_err());
}
