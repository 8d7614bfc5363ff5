//! Declare a two-section configuration record and load `conf.ini` into it.
//!
//! Run with `cargo run --example basic` from a directory containing a
//! CR-LF delimited `conf.ini`, for instance:
//!
//! ```ini
//! [mysql]
//! address = 127.0.0.1
//! port = 3306
//! [redis]
//! host = 127.0.0.1
//! port = 6379
//! database = 0
//! test = true
//! ```

use stanza_config::{LoadResultExt, Schema, load};

#[derive(Debug, Default)]
struct MysqlConfig {
    address: String,
    port: i64,
    username: String,
    password: String,
}

#[derive(Debug, Default)]
struct RedisConfig {
    host: String,
    port: i64,
    password: String,
    database: i64,
    test: bool,
}

#[derive(Debug, Default)]
struct AppConfig {
    mysql: MysqlConfig,
    redis: RedisConfig,
}

fn main() {
    let _guard = stanza_log::init().expect("logger setup");

    let schema = Schema::<AppConfig>::builder()
        .section("mysql", |c: &mut AppConfig| &mut c.mysql, |s| {
            s.text("address", |m: &mut MysqlConfig, v| m.address = v)
                .integer("port", |m, v| m.port = v)
                .text("username", |m, v| m.username = v)
                .text("password", |m, v| m.password = v)
        })
        .section("redis", |c: &mut AppConfig| &mut c.redis, |s| {
            s.text("host", |r: &mut RedisConfig, v| r.host = v)
                .integer("port", |r, v| r.port = v)
                .text("password", |r, v| r.password = v)
                .integer("database", |r, v| r.database = v)
                .boolean("test", |r, v| r.test = v)
        })
        .build()
        .expect("schema declarations");

    let mut config = AppConfig::default();
    if load("conf.ini", &schema, &mut config).log_error().is_some() {
        println!("{config:#?}");
    }
}
