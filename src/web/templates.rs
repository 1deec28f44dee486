//! Template rendering with Tera

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Add base template
        tera.add_raw_template("base.html", include_str!("../templates/base.html"))?;

        // Add page templates
        tera.add_raw_template("index.html", include_str!("../templates/index.html"))?;
        tera.add_raw_template("search.html", include_str!("../templates/search.html"))?;
        tera.add_raw_template("work.html", include_str!("../templates/work.html"))?;
        tera.add_raw_template("edition.html", include_str!("../templates/edition.html"))?;
        tera.add_raw_template(
            "collection.html",
            include_str!("../templates/collection.html"),
        )?;
        tera.add_raw_template("read.html", include_str!("../templates/read.html"))?;
        tera.add_raw_template("about.html", include_str!("../templates/about.html"))?;
        tera.add_raw_template("error.html", include_str!("../templates/error.html"))?;

        // Add component templates
        tera.add_raw_template(
            "components/work_card.html",
            include_str!("../templates/components/work_card.html"),
        )?;
        tera.add_raw_template(
            "components/pagination.html",
            include_str!("../templates/components/pagination.html"),
        )?;
        tera.add_raw_template(
            "components/filters.html",
            include_str!("../templates/components/filters.html"),
        )?;

        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &impl Serialize) -> Result<String> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &ctx)?)
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        assert!(Templates::new().is_ok());
    }
}
