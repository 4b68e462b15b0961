//! Configuration for the demo: a top-level string, a nested table mixing both
//! metadata dialects, and one field kept out of the flag set.

use confique::Config;
use validator::Validate;

use clapflags::{Field, Kind, Schema, Settings};

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

pub static DEMO_SCHEMA: Schema = Schema::new(
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

#[derive(Config, Validate, Debug)]
pub struct DemoConfig {
    #[validate(length(min = 1))]
    pub foo: String,

    #[config(nested)]
    #[validate]
    pub bar: Bar,

    /// Only settable from a config file.
    #[config(default = "another")]
    pub baz: String,
}

#[derive(Config, Validate, Debug)]
pub struct Bar {
    #[config(layer_attr(serde(rename = "exampleString")))]
    #[validate(length(max = 32))]
    pub example: String,

    pub enabled: bool,
}

impl Settings for DemoConfig {
    const SCHEMA: &'static Schema = &DEMO_SCHEMA;
}
