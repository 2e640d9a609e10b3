//! A small build pipeline
//!
//! ```text
//! cargo run --example pipeline
//! cargo run --example pipeline -- Test -a configuration=Release
//! cargo run --example pipeline -- --tree
//! cargo run --example pipeline -- --dryrun Publish
//! ```

use futures::FutureExt;
use kiln::cli::App;
use kiln::task::{Action, TaskRegistry};
use std::time::Duration;

fn configuration(ctx: &kiln::runner::Context) -> String {
    ctx.argument("configuration").unwrap_or("Debug").to_string()
}

fn tasks() -> kiln::error::ConfigResult<TaskRegistry> {
    let mut registry = TaskRegistry::new();

    registry
        .register_task("Clean")?
        .description("Remove previous build output")
        .does(|ctx| {
            ctx.log().information("Removing target directory");
            Ok(())
        });

    registry
        .register_task("Restore")?
        .description("Fetch dependencies")
        .does_async(|ctx| {
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                ctx.log().information("Dependencies are up to date");
                Ok(())
            }
            .boxed()
        });

    registry
        .register_task("Build")?
        .description("Compile the sources")
        .is_dependent_on("Clean")
        .is_dependent_on("Restore")
        .does(|ctx| {
            let configuration = configuration(ctx);
            ctx.log().information(&format!("Compiling in {} mode", configuration));
            Ok(())
        })
        .deferred(|ctx| {
            ctx.log().verbose("Build artifacts written");
            Ok(())
        });

    registry
        .register_task("Lint")?
        .description("Check code style")
        .does(|ctx| {
            if ctx.has_argument("strict") {
                anyhow::bail!("2 style warnings treated as errors");
            }
            Ok(())
        })
        .continue_on_error();

    registry
        .register_task("Test")?
        .description("Run the unit tests")
        .is_dependent_on("Build")
        .does(|ctx| {
            ctx.log().information("All tests passed");
            Ok(())
        })
        .on_error(|error, ctx| {
            ctx.log().warning(&format!("Tests failed: {}", error));
            Err(anyhow::anyhow!("{}", error))
        })
        .finally(|ctx| {
            ctx.log().verbose("Collecting test results");
            Ok(())
        });

    registry
        .register_task("Publish")?
        .description("Publish the package")
        .is_dependent_on("Test")
        .with_criteria_message(
            |ctx| Ok(configuration(ctx) == "Release"),
            "only Release builds are published",
        )
        .does(|ctx| {
            ctx.log().information("Package published");
            Ok(())
        });

    registry
        .register_task("Default")?
        .description("Build and test")
        .is_dependent_on("Test")
        .is_dependent_on("Lint");

    Ok(registry)
}

#[tokio::main]
async fn main() {
    let registry = match tasks() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let code = App::new(registry)
        .with_setup(Action::from_fn(|ctx| {
            ctx.log().verbose(&format!("Working directory: {}", ctx.working_dir.display()));
            Ok(())
        }))
        .with_teardown(Action::from_fn(|ctx| {
            ctx.log().verbose("Pipeline finished");
            Ok(())
        }))
        .run()
        .await;

    std::process::exit(code);
}
