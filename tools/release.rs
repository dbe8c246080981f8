use std::fs;
use std::io::{self, Write};
use std::process::Command;
use toml_edit::{DocumentMut, Item};

type ToolResult<T> = Result<T, Box<dyn std::error::Error>>;

fn git_output(args: &[&str]) -> ToolResult<Option<String>> {
    let output = Command::new("git").args(args).output()?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8(output.stdout)?.trim().to_string()))
}

fn latest_tag() -> ToolResult<String> {
    if let Some(tag) = git_output(&["describe", "--tags", "--abbrev=0"])? {
        return Ok(tag);
    }
    // No tags yet, start the notes from the root commit
    Ok(git_output(&["rev-list", "--max-parents=0", "HEAD"])?.unwrap_or_default())
}

fn release_notes(previous_tag: &str) -> ToolResult<String> {
    let range = format!("{}..HEAD", previous_tag);
    let mut args = vec!["log", "--pretty=format:- %s"];
    if !previous_tag.is_empty() {
        args.push(&range);
    }
    Ok(git_output(&args)?.unwrap_or_default())
}

fn confirm(message: &str) -> Result<bool, io::Error> {
    print!("{} (y/n): ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn run(program: &str, args: &[&str], failure: &str) -> ToolResult<()> {
    println!("Executing: {} {}", program, args.join(" "));
    let status = Command::new(program).args(args).status()?;
    if !status.success() {
        return Err(failure.into());
    }
    Ok(())
}

fn is_version(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn main() -> ToolResult<()> {
    let manifest = fs::read_to_string("Cargo.toml")?;
    let mut doc = manifest.parse::<DocumentMut>()?;

    let current_version = doc["package"]["version"]
        .as_str()
        .ok_or("Could not find package.version in Cargo.toml")?
        .to_string();
    let crate_name = doc["package"]["name"]
        .as_str()
        .unwrap_or("sovran-polyset")
        .to_string();

    println!("{} is at version {}", crate_name, current_version);
    println!("Enter new version:");
    let mut new_version = String::new();
    io::stdin().read_line(&mut new_version)?;
    let new_version = new_version.trim();

    if !is_version(new_version) {
        return Err(format!("'{}' is not a MAJOR.MINOR.PATCH version", new_version).into());
    }
    if new_version == current_version {
        return Err("New version matches the current one".into());
    }

    // The compile_fail doctests guard the closed-world guarantees, so run the lot
    run("cargo", &["test", "--all-targets"], "Tests failed")?;
    run("cargo", &["test", "--doc"], "Doctests failed")?;

    if !confirm(&format!("Ready to release version {}?", new_version))? {
        println!("Release aborted.");
        return Ok(());
    }

    doc["package"]["version"] = Item::from(new_version);
    fs::write("Cargo.toml", doc.to_string())?;
    println!("Updated Cargo.toml with new version: {}", new_version);

    run("cargo", &["check"], "Failed to update Cargo.lock")?;

    let previous_tag = latest_tag()?;
    let notes = release_notes(&previous_tag)?;
    if notes.is_empty() && !confirm("No commits since the previous tag. Continue?")? {
        println!("Release aborted.");
        return Ok(());
    }
    println!("Release notes:\n{}", notes);

    let tag = format!("v{}", new_version);
    let commit_message = format!("Bump version to {}", new_version);
    let tag_message = format!("Version {}", new_version);
    run("git", &["add", "Cargo.toml", "Cargo.lock"], "Failed to stage Cargo.toml")?;
    run("git", &["commit", "-m", &commit_message], "Failed to commit version bump")?;
    run("git", &["tag", "-a", &tag, "-m", &tag_message], "Failed to create tag")?;
    run("git", &["push"], "Failed to push commits")?;
    run("git", &["push", "--tags"], "Failed to push tags")?;

    if confirm("Publish to crates.io?")? {
        run("cargo", &["publish"], "Failed to publish to crates.io")?;
    } else {
        println!("Skipping crates.io publishing.");
    }

    if confirm("Create GitHub release?")? {
        run(
            "gh",
            &["release", "create", &tag, "--title", &tag, "--notes", &notes],
            "Failed to create GitHub release",
        )?;
    } else {
        println!("Skipping GitHub release creation.");
    }

    println!("Successfully released {} {}", crate_name, new_version);
    Ok(())
}
