//! Test fixtures for end-to-end audits
//!
//! These snapshots represent typical servers an audit runs against.

#![allow(dead_code)]

use dbwarden_core::{Database, Snapshot};

/// A MySQL 8.0 server without primary key enforcement, hosting a small shop
///
/// - `shop.customers`: INT key, two secondary indexes (cheap key)
/// - `shop.order_lines`: composite BIGINT key, two secondary indexes (wide key)
/// - `shop.audit_log`: no primary key at all
/// - `shop.legacy_sessions`: MyISAM, wide key
/// - `sys.sys_config`: system schema table
pub fn shop_snapshot() -> &'static str {
    r#"{
        "host": "db.internal",
        "port": 3306,
        "variables": {
            "version": "8.0.36-0ubuntu0.22.04.1",
            "sql_require_primary_key": "OFF",
            "performance_schema": "ON"
        },
        "status": { "Uptime": "86400", "Threads_connected": "12" },
        "schemas": [
            {
                "name": "shop",
                "tables": [
                    {
                        "name": "customers",
                        "information_schema": { "engine": "InnoDB", "table_type": "BASE TABLE" },
                        "columns": [
                            { "name": "id", "data_type": "int", "extra": "auto_increment" },
                            { "name": "email", "data_type": "varchar", "character_maximum_length": 255, "character_set_name": "utf8mb4" },
                            { "name": "country", "data_type": "char", "character_maximum_length": 2, "character_set_name": "ascii" }
                        ],
                        "indexes": [
                            { "name": "PRIMARY", "unique": true, "columns": ["id"] },
                            { "name": "uniq_email", "unique": true, "columns": ["email"] },
                            { "name": "idx_country", "columns": ["country"] }
                        ]
                    },
                    {
                        "name": "order_lines",
                        "information_schema": { "engine": "InnoDB", "table_type": "BASE TABLE" },
                        "columns": [
                            { "name": "order_id", "data_type": "bigint" },
                            { "name": "product_id", "data_type": "bigint" },
                            { "name": "quantity", "data_type": "smallint" },
                            { "name": "created_at", "data_type": "datetime" }
                        ],
                        "indexes": [
                            { "name": "PRIMARY", "unique": true, "columns": ["order_id", "product_id"] },
                            { "name": "idx_product", "columns": ["product_id"] },
                            { "name": "idx_created", "columns": ["created_at"] }
                        ]
                    },
                    {
                        "name": "audit_log",
                        "information_schema": { "engine": "InnoDB", "table_type": "BASE TABLE" },
                        "columns": [
                            { "name": "line", "data_type": "text", "is_nullable": true }
                        ],
                        "indexes": []
                    },
                    {
                        "name": "legacy_sessions",
                        "information_schema": { "engine": "MyISAM", "table_type": "BASE TABLE" },
                        "columns": [
                            { "name": "token", "data_type": "char", "character_maximum_length": 64, "character_set_name": "latin1" },
                            { "name": "user_id", "data_type": "int" }
                        ],
                        "indexes": [
                            { "name": "PRIMARY", "unique": true, "columns": ["token"] },
                            { "name": "idx_user", "columns": ["user_id"] }
                        ]
                    }
                ]
            },
            {
                "name": "sys",
                "tables": [
                    {
                        "name": "sys_config",
                        "information_schema": { "engine": "InnoDB", "table_type": "BASE TABLE" },
                        "columns": [
                            { "name": "variable", "data_type": "varchar", "character_maximum_length": 128, "character_set_name": "utf8mb4" },
                            { "name": "value", "data_type": "varchar", "character_maximum_length": 128, "character_set_name": "utf8mb4", "is_nullable": true }
                        ],
                        "indexes": [
                            { "name": "PRIMARY", "unique": true, "columns": ["variable"] },
                            { "name": "idx_value", "columns": ["value"] }
                        ]
                    }
                ]
            }
        ],
        "accounts": [
            { "username": "root", "host": "localhost" },
            { "username": "app", "host": "%" }
        ]
    }"#
}

/// Same server, as collected without the version variable
pub fn shop_snapshot_without_version() -> String {
    shop_snapshot().replace("\"version\": \"8.0.36-0ubuntu0.22.04.1\",", "")
}

pub fn shop() -> Database {
    Snapshot::from_json(shop_snapshot())
        .expect("fixture parses")
        .into_database()
        .expect("fixture is a valid graph")
}
