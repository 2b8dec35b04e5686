use axum_test::{TestRequest, TestServer};

use crate::{
    AppState,
    auth::User,
    build_router,
    test_utils::{create_test_user_with_email, log_in_test_user},
};

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state))
}

/// A test server with a registered user whose bearer token is added to every
/// request.
pub(crate) struct TestClient {
    pub server: TestServer,
    pub user: User,
    token: String,
}

impl TestClient {
    pub(crate) fn logged_in(state: AppState) -> Self {
        Self::logged_in_as(state, "test@example.com")
    }

    pub(crate) fn logged_in_as(state: AppState, email: &str) -> Self {
        let user = create_test_user_with_email(&state, email);
        let token = log_in_test_user(&state, user.id);

        Self {
            server: get_test_server(state),
            user,
            token,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(crate) fn get(&self, path: &str) -> TestRequest {
        self.server.get(path).add_header("Authorization", self.bearer())
    }

    pub(crate) fn post(&self, path: &str) -> TestRequest {
        self.server.post(path).add_header("Authorization", self.bearer())
    }

    pub(crate) fn put(&self, path: &str) -> TestRequest {
        self.server.put(path).add_header("Authorization", self.bearer())
    }

    pub(crate) fn delete(&self, path: &str) -> TestRequest {
        self.server.delete(path).add_header("Authorization", self.bearer())
    }
}
