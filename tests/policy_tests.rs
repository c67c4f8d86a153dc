use blog_engine::policy::{Action, Actor, Resource, Role, authorize};
use uuid::Uuid;

// --- Test Utilities ---

const MY_USER_ID: Uuid = Uuid::from_u128(1);
const MY_PROFILE_ID: Uuid = Uuid::from_u128(2);

fn actor(roles: &[Role]) -> Actor {
    Actor {
        user_id: MY_USER_ID,
        profile_id: MY_PROFILE_ID,
        username: "tester".to_string(),
        roles: roles.iter().copied().collect(),
    }
}

// --- Safe Methods ---

#[test]
fn test_anonymous_can_read_public_resources() {
    for resource in [
        Resource::Article { author: None },
        Resource::Comment { author: None },
        Resource::Like { owner: None },
        Resource::Profile { owner: None },
    ] {
        assert!(authorize(None, Action::List, &resource));
        assert!(authorize(None, Action::Retrieve, &resource));
    }
}

#[test]
fn test_anonymous_is_denied_every_write() {
    for resource in [
        Resource::User { id: None },
        Resource::Profile { owner: None },
        Resource::Article { author: None },
        Resource::Comment { author: None },
        Resource::Like { owner: None },
    ] {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(
                !authorize(None, action, &resource),
                "anonymous actor must be denied {:?} on {:?}",
                action,
                resource
            );
        }
    }
}

#[test]
fn test_anonymous_cannot_read_user_records() {
    assert!(!authorize(None, Action::List, &Resource::User { id: None }));
    assert!(!authorize(
        None,
        Action::Retrieve,
        &Resource::User { id: Some(MY_USER_ID) }
    ));
}

// --- Article Rules ---

#[test]
fn test_groupless_actor_cannot_create_articles() {
    // No group membership, no superuser bit: every create is denied.
    let nobody = actor(&[]);
    assert!(!authorize(
        Some(&nobody),
        Action::Create,
        &Resource::Article { author: None }
    ));
    assert!(!authorize(
        Some(&nobody),
        Action::Create,
        &Resource::Comment { author: None }
    ));
    assert!(!authorize(
        Some(&nobody),
        Action::Create,
        &Resource::Like { owner: None }
    ));
}

#[test]
fn test_plain_user_cannot_create_articles() {
    // Users-group membership is enough to comment and like, not to publish.
    let user = actor(&[Role::User]);
    assert!(!authorize(
        Some(&user),
        Action::Create,
        &Resource::Article { author: None }
    ));
    assert!(authorize(
        Some(&user),
        Action::Create,
        &Resource::Comment { author: None }
    ));
    assert!(authorize(
        Some(&user),
        Action::Create,
        &Resource::Like { owner: None }
    ));
}

#[test]
fn test_article_create_requires_moderator_or_better() {
    for roles in [&[Role::Moderator][..], &[Role::Admin], &[Role::Superuser]] {
        let a = actor(roles);
        assert!(authorize(
            Some(&a),
            Action::Create,
            &Resource::Article { author: None }
        ));
    }
}

#[test]
fn test_article_update_requires_author_and_moderator_together() {
    let article = Resource::Article {
        author: Some(MY_PROFILE_ID),
    };

    // The author without Moderators membership: denied, authorship alone is
    // not enough.
    let author_only = actor(&[Role::User]);
    assert!(!authorize(Some(&author_only), Action::Update, &article));
    assert!(!authorize(Some(&author_only), Action::Delete, &article));

    // The author who also holds Moderators: allowed.
    let author_mod = actor(&[Role::User, Role::Moderator]);
    assert!(authorize(Some(&author_mod), Action::Update, &article));
    assert!(authorize(Some(&author_mod), Action::Delete, &article));

    // A Moderators member who is not the author: denied.
    let mut stranger_mod = actor(&[Role::Moderator]);
    stranger_mod.profile_id = Uuid::from_u128(777);
    assert!(!authorize(Some(&stranger_mod), Action::Update, &article));

    // Admins and superusers override ownership entirely.
    let mut admin = actor(&[Role::Admin]);
    admin.profile_id = Uuid::from_u128(777);
    assert!(authorize(Some(&admin), Action::Update, &article));
    assert!(authorize(Some(&admin), Action::Delete, &article));

    let mut root = actor(&[Role::Superuser]);
    root.profile_id = Uuid::from_u128(777);
    assert!(authorize(Some(&root), Action::Delete, &article));
}

// --- Comment Rules ---

#[test]
fn test_comment_author_can_edit_and_delete_own() {
    let comment = Resource::Comment {
        author: Some(MY_PROFILE_ID),
    };
    let author = actor(&[Role::User]);
    assert!(authorize(Some(&author), Action::Update, &comment));
    assert!(authorize(Some(&author), Action::Delete, &comment));
}

#[test]
fn test_comment_delete_excludes_moderators() {
    // Moderators may edit other people's comments but not delete them;
    // deletion needs the author, an admin, or a superuser.
    let mut moderator = actor(&[Role::Moderator]);
    moderator.profile_id = Uuid::from_u128(777);
    let comment = Resource::Comment {
        author: Some(MY_PROFILE_ID),
    };
    assert!(authorize(Some(&moderator), Action::Update, &comment));
    assert!(!authorize(Some(&moderator), Action::Delete, &comment));

    let mut admin = actor(&[Role::Admin]);
    admin.profile_id = Uuid::from_u128(777);
    assert!(authorize(Some(&admin), Action::Delete, &comment));
}

// --- Like Rules ---

#[test]
fn test_like_delete_is_owner_only() {
    let like = Resource::Like {
        owner: Some(MY_PROFILE_ID),
    };

    // Even a superuser cannot remove someone else's like.
    let mut root = actor(&[Role::Superuser]);
    root.profile_id = Uuid::from_u128(777);
    assert!(!authorize(Some(&root), Action::Delete, &like));

    let owner = actor(&[Role::User]);
    assert!(authorize(Some(&owner), Action::Delete, &like));
}

#[test]
fn test_like_update_is_never_allowed() {
    let like = Resource::Like {
        owner: Some(MY_PROFILE_ID),
    };
    let owner = actor(&[Role::User, Role::Admin, Role::Superuser]);
    assert!(!authorize(Some(&owner), Action::Update, &like));
}

// --- User & Profile Rules ---

#[test]
fn test_user_reads_require_self_or_elevation() {
    let me = actor(&[Role::User]);
    let my_record = Resource::User {
        id: Some(MY_USER_ID),
    };
    let other_record = Resource::User {
        id: Some(Uuid::from_u128(99)),
    };

    assert!(authorize(Some(&me), Action::Retrieve, &my_record));
    assert!(!authorize(Some(&me), Action::Retrieve, &other_record));
    assert!(!authorize(Some(&me), Action::List, &Resource::User { id: None }));

    let admin = actor(&[Role::Admin]);
    assert!(authorize(Some(&admin), Action::Retrieve, &other_record));
    assert!(authorize(Some(&admin), Action::List, &Resource::User { id: None }));
    assert!(authorize(Some(&admin), Action::Delete, &other_record));
}

#[test]
fn test_user_update_is_strictly_self() {
    // Not even a superuser may rewrite someone else's credentials.
    let root = actor(&[Role::Superuser]);
    let other_record = Resource::User {
        id: Some(Uuid::from_u128(99)),
    };
    assert!(!authorize(Some(&root), Action::Update, &other_record));

    let me = actor(&[]);
    assert!(authorize(
        Some(&me),
        Action::Update,
        &Resource::User { id: Some(MY_USER_ID) }
    ));
}

#[test]
fn test_user_create_is_never_authorized_directly() {
    // Account creation only happens through the registration flow.
    let root = actor(&[Role::Superuser]);
    assert!(!authorize(Some(&root), Action::Create, &Resource::User { id: None }));
}

#[test]
fn test_profile_update_owner_only_and_delete_nobody() {
    let mine = Resource::Profile {
        owner: Some(MY_USER_ID),
    };
    let me = actor(&[Role::User]);
    assert!(authorize(Some(&me), Action::Update, &mine));

    let mut admin = actor(&[Role::Admin]);
    admin.user_id = Uuid::from_u128(99);
    assert!(!authorize(Some(&admin), Action::Update, &mine));

    // Nobody deletes a profile directly, and nobody creates one by hand.
    let root = actor(&[Role::Superuser]);
    assert!(!authorize(Some(&root), Action::Delete, &mine));
    assert!(!authorize(
        Some(&root),
        Action::Create,
        &Resource::Profile { owner: None }
    ));
}

// --- Role Resolution ---

#[test]
fn test_primary_role_prefers_the_highest() {
    assert_eq!(actor(&[]).primary_role(), Role::User);
    assert_eq!(actor(&[Role::User]).primary_role(), Role::User);
    assert_eq!(
        actor(&[Role::User, Role::Moderator]).primary_role(),
        Role::Moderator
    );
    // A moderator who is also an admin reports admin, not moderator.
    assert_eq!(
        actor(&[Role::Moderator, Role::Admin]).primary_role(),
        Role::Admin
    );
    assert_eq!(
        actor(&[Role::User, Role::Admin, Role::Superuser]).primary_role(),
        Role::Superuser
    );
}

#[test]
fn test_role_group_mapping() {
    assert_eq!(Role::from_group("Users"), Some(Role::User));
    assert_eq!(Role::from_group("Moderators"), Some(Role::Moderator));
    assert_eq!(Role::from_group("Admins"), Some(Role::Admin));
    assert_eq!(Role::from_group("Wizards"), None);
}

#[test]
fn test_action_safety_classification() {
    assert!(Action::List.is_safe());
    assert!(Action::Retrieve.is_safe());
    assert!(!Action::Create.is_safe());
    assert!(!Action::Update.is_safe());
    assert!(!Action::Delete.is_safe());
}
