mod filter_server_mock;

pub use filter_server_mock::MockFilterServer;
