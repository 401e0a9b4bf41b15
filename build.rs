use vergen_gitcl::{Emitter, Gitcl};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Branch, SHA and dirty flag feed `version_string()`. Builds outside a
    // git checkout leave them unset.
    let gitcl = Gitcl::builder().branch(true).sha(true).dirty(true).build();
    Emitter::default().add_instructions(&gitcl)?.emit()?;
    Ok(())
}
