use forum_auth::{
    models::Role,
    policy::{self, AccessError},
    token::{Claims, TokenError},
};

fn claims(user_id: i32, role: Role) -> Claims {
    Claims {
        user_id,
        role_id: role.id(),
        iat: 1_700_000_000,
        exp: 1_700_001_800,
    }
}

const ALL_ROLES: [Role; 3] = [Role::Standard, Role::Author, Role::Moderator];

// --- Authenticated-only ---

#[test]
fn test_authenticated_admits_every_role() {
    for role in ALL_ROLES {
        let c = claims(5, role);
        assert_eq!(policy::authenticated(Ok(c.clone())), Ok(c));
    }
}

#[test]
fn test_authenticated_rejects_decode_failures() {
    for reason in [TokenError::Missing, TokenError::Invalid, TokenError::Expired] {
        assert_eq!(
            policy::authenticated(Err(reason.clone())),
            Err(AccessError::Unauthorized(reason))
        );
    }
}

// --- Author-or-moderator ---

#[test]
fn test_owner_is_admitted_whatever_the_role() {
    for role in ALL_ROLES {
        assert_eq!(policy::author_or_moderator(&claims(5, role), 5), Ok(()));
    }
}

#[test]
fn test_non_owner_non_moderator_is_forbidden() {
    for role in [Role::Standard, Role::Author] {
        assert_eq!(
            policy::author_or_moderator(&claims(5, role), 6),
            Err(AccessError::Forbidden)
        );
    }
}

#[test]
fn test_moderator_is_admitted_regardless_of_owner() {
    let moderator = claims(1, Role::Moderator);
    for owner in [1, 2, 999, -1] {
        assert_eq!(policy::author_or_moderator(&moderator, owner), Ok(()));
    }
}

// --- Moderator-only ---

#[test]
fn test_moderator_only() {
    assert_eq!(policy::moderator_only(&claims(1, Role::Moderator)), Ok(()));
    assert_eq!(
        policy::moderator_only(&claims(1, Role::Author)),
        Err(AccessError::Forbidden)
    );
    assert_eq!(
        policy::moderator_only(&claims(1, Role::Standard)),
        Err(AccessError::Forbidden)
    );
}

#[test]
fn test_unknown_role_id_has_no_privileges() {
    let odd = Claims {
        role_id: 99,
        ..claims(5, Role::Standard)
    };
    assert_eq!(policy::moderator_only(&odd), Err(AccessError::Forbidden));
    assert_eq!(
        policy::author_or_moderator(&odd, 6),
        Err(AccessError::Forbidden)
    );
    assert_eq!(policy::author_or_moderator(&odd, 5), Ok(()));
}
