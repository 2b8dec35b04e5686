#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod state;

pub(crate) use http::{TestClient, get_test_server};
pub(crate) use state::{
    TEST_PASSWORD, create_test_user, create_test_user_with_email, get_test_app_state,
    log_in_test_user,
};
