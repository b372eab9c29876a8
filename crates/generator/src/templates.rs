//! Template loading and management

use asset_spec_generator_common::{Result, SpecError};
use tera::Tera;

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.add_raw_template("asset_func", include_str!("../templates/asset_func.ts.tera"))
        .map_err(|e| {
            SpecError::Generation(format!("Failed to load asset_func template: {}", e))
        })?;

    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        assert!(tera.get_template_names().any(|n| n == "asset_func"));
    }

    #[test]
    fn test_asset_func_skeleton_renders() {
        let tera = load_templates().unwrap();
        let mut context = tera::Context::new();
        context.insert("props", &Vec::<String>::new());
        context.insert("sockets", &Vec::<String>::new());
        let rendered = tera.render("asset_func", &context).unwrap();
        assert!(rendered.contains("function main()"));
        assert!(rendered.contains("return asset.build();"));
    }
}
