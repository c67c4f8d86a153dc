/// Router Module Index
///
/// Routing is split into two security tiers. Public routes carry no
/// middleware; every read-only collection lives there because safe methods
/// are open to everyone, anonymous included. Authenticated routes sit
/// behind the `AuthUser` extractor layer, and the fine-grained decisions
/// (ownership, group membership, the article-author conjunction) happen in
/// the policy engine inside each handler; there is no separate admin
/// router because admin power is a policy outcome, not a routing tier.

/// Routes accessible to all clients (anonymous, read-only, plus the
/// registration/login gateway).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware. Requires a
/// resolvable actor; per-action authorization happens in the handlers.
pub mod authenticated;
