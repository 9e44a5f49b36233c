//! Status command: active profile plus DDL tree state

use colored::Colorize;
use serde_json::json;

use ddl_fs::NormalizedPath;

use crate::context::Context;
use crate::error::Result;

pub fn run(ctx: &Context, json_output: bool) -> Result<()> {
    let (name, profile) = ctx.profile()?;
    let root = NormalizedPath::new(&profile.ddl_root);

    let dirty = if root.exists() {
        ddl_git::dirty_paths(&root).ok()
    } else {
        None
    };

    if json_output {
        let payload = json!({
            "profile": name,
            "platform": profile.platform,
            "database": profile.database,
            "schema": profile.schema,
            "ddl_root": profile.ddl_root,
            "root_exists": root.exists(),
            "dirty_paths": dirty,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} profile '{}'", "=>".blue().bold(), name.cyan());
    println!(
        "   {} {}.{} on {}",
        profile.platform,
        profile.database.as_deref().unwrap_or("?"),
        profile.schema.as_deref().unwrap_or("?"),
        profile.account.as_deref().unwrap_or("?")
    );
    println!("   tree: {}", profile.ddl_root.display());

    match dirty {
        None => println!(
            "   {} tree not initialized; run {}",
            "!".yellow().bold(),
            "ddlrepo init".cyan()
        ),
        Some(dirty) if dirty.is_empty() => {
            println!("   {} working tree clean", "OK".green().bold());
        }
        Some(dirty) => {
            println!(
                "   {} {} uncommitted path(s):",
                "!".yellow().bold(),
                dirty.len()
            );
            for path in dirty {
                println!("      {}", path.dimmed());
            }
        }
    }

    Ok(())
}
