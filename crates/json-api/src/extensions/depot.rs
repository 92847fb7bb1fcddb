//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::{auth::Authenticated, domain::access::Principal};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller resolved from the bearer token.
    fn insert_authenticated(&mut self, authenticated: Authenticated);

    /// The caller and their session, if a bearer token was presented.
    fn authenticated(&self) -> Option<Authenticated>;

    fn authenticated_or_401(&self) -> Result<Authenticated, StatusError>;

    fn principal(&self) -> Option<Principal> {
        self.authenticated()
            .map(|authenticated| authenticated.principal)
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.authenticated_or_401()
            .map(|authenticated| authenticated.principal)
    }
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_authenticated(&mut self, authenticated: Authenticated) {
        self.inject(authenticated);
    }

    fn authenticated(&self) -> Option<Authenticated> {
        self.obtain::<Authenticated>().ok().copied()
    }

    fn authenticated_or_401(&self) -> Result<Authenticated, StatusError> {
        self.authenticated()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use storefront_app::{
        auth::SessionUuid,
        domain::users::records::{Role, UserUuid},
    };

    use super::*;

    #[test]
    fn empty_depot_has_no_principal() {
        let depot = Depot::new();

        assert_eq!(depot.principal(), None);
        assert!(depot.principal_or_401().is_err());
    }

    #[test]
    fn inserted_caller_is_returned() {
        let principal = Principal::new(UserUuid::new(), Role::User);
        let session = SessionUuid::new();

        let mut depot = Depot::new();

        depot.insert_authenticated(Authenticated { principal, session });

        assert_eq!(depot.principal(), Some(principal));
        assert_eq!(
            depot.authenticated_or_401().ok().map(|caller| caller.session),
            Some(session)
        );
    }
}
