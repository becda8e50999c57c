use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // optionally emit git branch and hash
    let _ = EmitBuilder::builder()
        .git_branch()
        .git_sha(true)
        // don't emit on error
        // we ignore the "fail" part
        .fail_on_error()
        .quiet()
        .emit();
    Ok(())
}
