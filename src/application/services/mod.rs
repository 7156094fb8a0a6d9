//! Business logic services for the application layer.

pub mod auth_resource;
pub mod link_service;

pub use auth_resource::{AuthConfig, AuthResource, IssuedToken};
pub use link_service::LinkService;

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;

    use crate::domain::store::{
        MockUrlStore, MockUserStore, Store, StoreError, UrlStore, UserStore,
    };

    /// Store whose sub-stores are mockall mocks.
    pub struct StubStore {
        pub users: MockUserStore,
        pub urls: MockUrlStore,
    }

    impl StubStore {
        pub fn new() -> Self {
            Self {
                users: MockUserStore::new(),
                urls: MockUrlStore::new(),
            }
        }
    }

    #[async_trait]
    impl Store for StubStore {
        fn users(&self) -> &dyn UserStore {
            &self.users
        }

        fn urls(&self) -> &dyn UrlStore {
            &self.urls
        }

        async fn migrate(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn drop_schema(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }
}
