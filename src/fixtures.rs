#[cfg(test)]
pub mod test {
    use confique::Config;
    use serde::{Deserialize, Serialize};

    use crate::builder::AppConfig;

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct TestConfig {
        #[config(default = "layer_01_value_00")]
        pub key_00: String,

        #[config(default = "layer_01_value_01")]
        pub key_01: String,

        #[config(nested)]
        pub key_02: Key02,

        #[config(nested)]
        pub key_03: Key03,
    }

    impl AppConfig for TestConfig {
        const APP_NAME: &'static str = "app_name";
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct Key02 {
        #[config(default = "layer_01_value_02_01")]
        pub subkey_01: String,

        #[config(default = "layer_01_value_02_02")]
        pub subkey_02: String,

        #[config(default = "layer_01_value_02_03")]
        pub subkey_03: String,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct Key03 {
        #[config(nested)]
        pub subkey_00: Key03Sub00,

        #[config(nested)]
        pub subkey_01: Key03Sub01,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct Key03Sub00 {
        #[config(default = "layer_01_value_03_00_00")]
        pub subsubkey_00: String,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct Key03Sub01 {
        #[config(default = "layer_01_value_03_01_00")]
        pub subsubkey_00: String,

        #[config(default = "layer_01_value_03_01_01")]
        pub subsubkey_01: String,
    }

    pub const TEST_CONFIG_PATHS: [&str; 8] = [
        "key_00",
        "key_01",
        "key_02.subkey_01",
        "key_02.subkey_02",
        "key_02.subkey_03",
        "key_03.subkey_00.subsubkey_00",
        "key_03.subkey_01.subsubkey_00",
        "key_03.subkey_01.subsubkey_01",
    ];

    // -- Fixture for coercion tests ---------------------------------------------

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct TypedConfig {
        /// The application host.
        #[config(default = "localhost")]
        pub host: String,

        /// The port number.
        #[config(default = 8080)]
        pub port: u16,

        /// Enable debug mode.
        #[config(default = false)]
        pub debug: bool,

        #[config(default = 1.5)]
        pub rate: f64,

        /// Database settings.
        #[config(nested)]
        pub database: TypedDbConfig,
    }

    impl AppConfig for TypedConfig {
        const APP_NAME: &'static str = "MyApp";
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct TypedDbConfig {
        /// Connection string URL.
        pub url: Option<String>,

        /// Connection pool size.
        #[config(default = 5)]
        pub pool_size: usize,
    }

    // -- Fixture for required-field tests ----------------------------------------

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct RequiredConfig {
        pub token: String,

        #[config(default = "info")]
        pub level: String,

        #[config(nested)]
        pub auth: RequiredAuth,
    }

    impl AppConfig for RequiredConfig {
        const APP_NAME: &'static str = "req";
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct RequiredAuth {
        pub user: String,
    }

    #[test]
    fn test_config_loads_defaults() {
        let config = TestConfig::builder().load().unwrap();
        assert_eq!(config.key_00, "layer_01_value_00");
        assert_eq!(config.key_02.subkey_03, "layer_01_value_02_03");
        assert_eq!(config.key_03.subkey_01.subsubkey_01, "layer_01_value_03_01_01");
    }

    #[test]
    fn typed_config_loads_defaults() {
        let config = TypedConfig::builder().load().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate, 1.5);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.pool_size, 5);
    }
}
