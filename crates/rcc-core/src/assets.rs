//! Installed template assets, embedded at build time

/// Boilerplate program every snippet is rendered into
pub const TEMPLATE_SOURCE: &str = include_str!("../assets/rcc_template.cpp");

/// Support header included (and precompiled) by the template
pub const TEMPLATE_HEADER: &str = include_str!("../assets/rcc_template.hpp");

pub const TEMPLATE_SOURCE_FILE: &str = "rcc_template.cpp";
pub const TEMPLATE_HEADER_FILE: &str = "rcc_template.hpp";

/// Directory of auto-selected precompiled headers (g++)
pub const GCH_DIR: &str = "rcc_template.hpp.gch";

/// Explicit precompiled headers (clang++)
pub const PCH_FILE: &str = "rcc_template.hpp.pch";
pub const PCH_ALL_FILE: &str = "rcc_template.hpp.all.pch";
