pub(crate) mod download_session;
