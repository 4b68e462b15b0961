#[cfg(test)]
pub mod test {
    use std::collections::HashMap;

    use confique::Config;
    use validator::Validate;

    use crate::schema::{Field, Kind, Schema, Settings};
    use crate::validate::Messages;

    // -- Two-level schema mixing both metadata dialects ------------------------

    pub static BAR_SCHEMA: Schema = Schema::new(
        "Bar",
        &[
            Field::tagged("example", Kind::String, "exampleString;;;interesting value"),
            Field::leaf("enabled", "enabled", Kind::Bool)
                .short('e')
                .default("false")
                .usage("enables something"),
        ],
    );

    pub static EXAMPLE_SCHEMA: Schema = Schema::new(
        "Config",
        &[
            Field::tagged(
                "foo",
                Kind::String,
                "foo;f;gopher;something something something...",
            ),
            Field::tagged("bar", Kind::Nested(&BAR_SCHEMA), "bar"),
            Field::skip("baz", Kind::String),
        ],
    );

    #[derive(Config, Validate, Debug, PartialEq)]
    pub struct ExampleConfig {
        #[validate(length(min = 1))]
        pub foo: String,

        #[config(nested)]
        #[validate]
        pub bar: ExampleBar,

        /// Not exposed as a flag.
        #[config(default = "another")]
        pub baz: String,
    }

    #[derive(Config, Validate, Debug, PartialEq)]
    pub struct ExampleBar {
        #[config(layer_attr(serde(rename = "exampleString")))]
        pub example: String,

        pub enabled: bool,
    }

    impl Settings for ExampleConfig {
        const SCHEMA: &'static Schema = &EXAMPLE_SCHEMA;
    }

    // -- Schema covering every flag kind ---------------------------------------

    pub static TLS_SCHEMA: Schema = Schema::new(
        "Tls",
        &[
            Field::leaf("enabled", "enabled", Kind::Bool).usage("serve over TLS"),
            Field::leaf("cert_path", "certPath", Kind::String).usage("certificate file"),
        ],
    );

    pub static SERVER_SCHEMA: Schema = Schema::new(
        "Server",
        &[
            Field::tagged(
                "listen",
                Kind::String,
                "listen;l;localhost:8080;address to listen on",
            ),
            Field::tagged("workers", Kind::U8, "workers;w;4;worker threads"),
            Field::tagged("ratio", Kind::F64, "ratio;;0.5;sampling ratio"),
            Field::tagged("tags", Kind::StringList, "tags;;web,api;service tags"),
            Field::tagged("offset", Kind::I64, "offset;;;clock offset in seconds"),
            Field::nested("tls", "tls", &TLS_SCHEMA),
            Field::skip("labels", Kind::Map),
        ],
    );

    #[derive(Config, Validate, Debug)]
    pub struct ServerConfig {
        #[validate(custom = "crate::validate::hostname_port")]
        pub listen: String,

        #[validate(range(min = 1, max = 64))]
        pub workers: u8,

        pub ratio: f64,

        pub tags: Vec<String>,

        pub offset: i64,

        #[config(nested)]
        #[validate]
        pub tls: TlsConfig,

        /// Only settable from files.
        pub labels: Option<HashMap<String, String>>,
    }

    #[derive(Config, Validate, Debug)]
    pub struct TlsConfig {
        pub enabled: bool,

        #[config(layer_attr(serde(rename = "certPath")))]
        pub cert_path: String,
    }

    impl Settings for ServerConfig {
        const SCHEMA: &'static Schema = &SERVER_SCHEMA;

        fn pre_validate(&self, messages: &mut Messages) {
            messages.insert("range", "{0} is outside {min}..={max}");
        }
    }
}
