//! Routing-rule generation for the front web server.
//!
//! The one pure component: (version list, URL prefix, output path) in,
//! nginx location blocks out. Nothing here touches the filesystem. The
//! fallback chain embeds `if (-f …)` probes that nginx evaluates per
//! request, so the rules must be regenerated when the version list or the
//! output layout changes.
use std::path::Path;

use crate::config::{ProjectConfig, VersionConfig, VersionKind};

/// Fallback suffixes, longest first so `/latest` requests are not
/// swallowed by the bare-prefix capture.
const FALLBACK_SUFFIXES: [&str; 2] = ["/latest", ""];

/// Versions eligible for fallback resolution: stable group first, then
/// unstable, each group ordered by slug. Slug order stands in for version
/// recency here, which holds only while slugs sort like version numbers.
pub fn priority_order(project: &ProjectConfig) -> Vec<&VersionConfig> {
    let mut ranked: Vec<(u8, &VersionConfig)> = project
        .versions
        .iter()
        .filter_map(|version| type_rank(version.kind).map(|rank| (rank, version)))
        .collect();
    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a.cmp(rank_b).then_with(|| a.slug.cmp(&b.slug))
    });
    ranked.into_iter().map(|(_, version)| version).collect()
}

fn type_rank(kind: VersionKind) -> Option<u8> {
    match kind {
        VersionKind::Stable => Some(0),
        VersionKind::Unstable => Some(1),
        VersionKind::Other => None,
    }
}

/// Render the routing rules for one project.
///
/// `url_prefix` falls back to the config's `default_url_prefix`; trailing
/// slashes are stripped either way.
pub fn generate_routing_config(
    project: &ProjectConfig,
    output_path: &Path,
    url_prefix: Option<&str>,
) -> String {
    let prefix = url_prefix
        .unwrap_or(&project.default_url_prefix)
        .trim_end_matches('/');
    let output = output_path.display();

    let mut out = String::new();

    // Direct mapping per version. `^~` keeps these authoritative over the
    // regex fallback locations below.
    for version in &project.versions {
        push_line(&mut out, &format!("location ^~ {prefix}/{} {{", version.slug));
        push_line(&mut out, &format!("    alias {output}/{};", version.slug));
        push_line(&mut out, "}");
    }

    let priority = priority_order(project);

    // Bare prefix, with or without trailing slash.
    push_line(&mut out, &format!("location ~ ^{prefix}/?$ {{"));
    push_line(&mut out, &format!("    return 302 {prefix}/latest/;"));
    push_line(&mut out, "}");

    // Inventories always point at the newest version so cross-references
    // resolve against the most complete object index.
    if let Some(inventory) = priority.last() {
        for suffix in FALLBACK_SUFFIXES {
            push_line(
                &mut out,
                &format!("location = {prefix}{suffix}/objects.inv {{"),
            );
            push_line(
                &mut out,
                &format!("    return 302 {prefix}/{}/objects.inv;", inventory.slug),
            );
            push_line(&mut out, "}");
        }
    }

    // Version-relative fallback: the first version in priority order that
    // has the requested page wins.
    for suffix in FALLBACK_SUFFIXES {
        push_line(&mut out, &format!("location ~ ^{prefix}{suffix}(.*)$ {{"));
        push_line(&mut out, "    set $doc_rest $1;");
        for version in &priority {
            push_line(
                &mut out,
                &format!("    if (-f {output}/{}$doc_rest/index.html) {{", version.slug),
            );
            push_line(
                &mut out,
                &format!("        return 302 {prefix}/{}$doc_rest;", version.slug),
            );
            push_line(&mut out, "    }");
        }
        push_line(&mut out, "}");
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
#[path = "nginx_tests.rs"]
mod tests;
