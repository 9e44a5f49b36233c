//! Profile management commands

use colored::Colorize;

use ddl_meta::Profile;

use crate::cli::ProfileAction;
use crate::context::Context;
use crate::error::Result;

pub fn run(ctx: &mut Context, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Add {
            name,
            platform,
            ddl_root,
            account,
            username,
            database,
            schema,
            warehouse,
            role,
            git_author_name,
            git_author_email,
            auto_push,
            activate,
        } => {
            let profile = Profile {
                platform,
                ddl_root,
                account,
                username,
                database,
                schema,
                warehouse,
                role,
                git_author_name,
                git_author_email,
                auto_push,
            };
            ctx.store.set(&name, profile)?;
            if activate {
                ctx.store.set_active(&name)?;
            }
            ctx.store.save()?;
            println!("{} Saved profile '{}'", "OK".green().bold(), name.cyan());
            if activate {
                println!("   Now active.");
            }
            Ok(())
        }

        ProfileAction::List => {
            let names = ctx.store.list();
            if names.is_empty() {
                println!("No profiles. Run {} to add one.", "ddlrepo profile add".cyan());
                return Ok(());
            }
            let active = ctx.store.active_profile_name();
            for name in names {
                if Some(name) == active {
                    println!("{} {}", "*".green().bold(), name.bold());
                } else {
                    println!("  {name}");
                }
            }
            Ok(())
        }

        ProfileAction::Show { name } => {
            let (name, profile) = match &name {
                Some(n) => (n.as_str(), ctx.store.get(n)?),
                None => {
                    let p = ctx.store.active_profile()?;
                    (ctx.store.active_profile_name().unwrap_or_default(), p)
                }
            };
            println!("{}", name.bold());
            println!("  platform:  {}", profile.platform);
            println!("  ddl_root:  {}", profile.ddl_root.display());
            if let Some(account) = &profile.account {
                println!("  account:   {account}");
            }
            if let Some(username) = &profile.username {
                println!("  username:  {username}");
            }
            if let Some(database) = &profile.database {
                println!("  database:  {database}");
            }
            if let Some(schema) = &profile.schema {
                println!("  schema:    {schema}");
            }
            if let Some(warehouse) = &profile.warehouse {
                println!("  warehouse: {warehouse}");
            }
            if let Some(role) = &profile.role {
                println!("  role:      {role}");
            }
            println!("  auto_push: {}", profile.auto_push);
            Ok(())
        }

        ProfileAction::Use { name } => {
            ctx.store.set_active(&name)?;
            ctx.store.save()?;
            println!("{} Active profile is now '{}'", "OK".green().bold(), name.cyan());
            Ok(())
        }

        ProfileAction::Delete { name } => {
            ctx.store.delete(&name)?;
            ctx.store.save()?;
            println!("{} Deleted profile '{}'", "OK".green().bold(), name.cyan());
            Ok(())
        }
    }
}
