//! Built-in schema for package manifests
//!
//! A manifest describes a C package: its metadata, optional library output,
//! build profiles, registries, binaries, and dependency configuration.
//!
//! ```toml
//! [package]
//! name = "myapp"
//! version = "1.0.0"
//!
//! [[bin]]
//! name = "myapp"
//! source = ["main.c"]
//!
//! [deps]
//! sp = "1.5.1"
//! ```

use tomlschema_core::{Rule, Schema};

fn string_list() -> Rule {
    Rule::array_of(Rule::string())
}

fn package() -> Rule {
    Rule::table()
        .property("name", Rule::string().min_length(1).required())
        .property("version", Rule::string().required())
        .property("repo", Rule::string())
        .property("author", Rule::string())
        .property("maintainer", Rule::string())
        .property("commit", Rule::string())
        .property("include", string_list())
        .property("define", string_list())
        .required()
}

fn lib() -> Rule {
    Rule::table()
        .property(
            "kinds",
            Rule::array_of(Rule::string().one_of(["shared", "static"])),
        )
        .property("name", Rule::string())
}

fn profile() -> Rule {
    Rule::table()
        .property("name", Rule::string().required())
        .property(
            "cc",
            Rule::string().one_of(["gcc", "clang", "tcc", "msvc"]),
        )
        .property("libc", Rule::string())
        .property("standard", Rule::string())
        .property("mode", Rule::string().one_of(["debug", "release"]))
        // alias for `standard`
        .property("language", Rule::string())
}

fn registry() -> Rule {
    Rule::table()
        .property("name", Rule::string())
        .property("location", Rule::string().required())
}

fn bin() -> Rule {
    Rule::table()
        .property("name", Rule::string().required())
        .property("source", string_list().min_items(1).required())
        .property("include", string_list())
        .property("define", string_list())
        .property("profile", Rule::string())
}

/// Build the package manifest schema
pub fn build() -> Schema {
    // dependency name -> version requirement
    let deps = Rule::table().additional(Rule::string());
    let options = Rule::table().additional(Rule::any());
    // config.<dep> holds arbitrary settings for that dependency
    let config = Rule::table().additional(Rule::table().additional(Rule::any()));

    Schema::with_root(
        Rule::table()
            .property("package", package())
            .property("lib", lib())
            .property("profile", Rule::array_of(profile()))
            .property("registry", Rule::array_of(registry()))
            .property("bin", Rule::array_of(bin()))
            .property("deps", deps)
            .property("options", options)
            .property("config", config),
    )
}
