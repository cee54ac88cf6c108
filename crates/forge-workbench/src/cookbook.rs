//! Built-in audited patterns.
//!
//! Each pattern can scaffold a minimal instruction file, which goes
//! through the same parsing path as an assistant reply.

/// A ready-made skill template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookbookPattern {
    /// Display title.
    pub title: &'static str,
    /// What the resulting skill does.
    pub description: &'static str,
    /// Suggested package layout.
    pub architecture: &'static str,
}

/// The built-in patterns.
pub const PATTERNS: [CookbookPattern; 4] = [
    CookbookPattern {
        title: "Financial Ratio Analyzer",
        description: "Extract quarterly metrics (Revenue, EBITDA, Net Income) and calculate \
            profitability, liquidity, and leverage ratios using industrial benchmarks.",
        architecture: "SKILL.md + scripts/calculate_ratios.py + scripts/interpret_ratios.py",
    },
    CookbookPattern {
        title: "Brand Compliance Engine",
        description: "Enforce colors (Acme Blue #0066CC), fonts (Segoe UI), and layouts across \
            PDF, PPTX, and XLSX exports using a centralized style sheet.",
        architecture: "SKILL.md + scripts/apply_brand.py + REFERENCE.md",
    },
    CookbookPattern {
        title: "Advanced DCF Valuation",
        description: "Build enterprise models with 5-year projections, WACC components, and \
            multi-variable sensitivity tables.",
        architecture: "SKILL.md + scripts/dcf_model.py + scripts/sensitivity_analysis.py",
    },
    CookbookPattern {
        title: "React Logic Scaffolder",
        description: "Transform natural language descriptions into atomic functional JSX \
            components with professional prop-types and styles.",
        architecture: "SKILL.md + scripts/component_logic.py",
    },
];

impl CookbookPattern {
    /// Lowercase title with whitespace runs replaced by `-`.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_workbench::cookbook::PATTERNS;
    ///
    /// assert_eq!(PATTERNS[2].slug(), "advanced-dcf-valuation");
    /// ```
    #[must_use]
    pub fn slug(&self) -> String {
        self.title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }

    /// Reply text that scaffolds this pattern's instruction file.
    #[must_use]
    pub fn scaffold_text(&self) -> String {
        format!(
            "[FILE: SKILL.md]\n\
             name: {slug}\n\
             description: {description}\n\
             metadata:\n  triggers: [\"create\", \"analyze\"]\n  capabilities: [\"code_execution\"]\n\n\
             # Instructions\n\
             Follow the {title} audited pattern.",
            slug = self.slug(),
            description = self.description,
            title = self.title,
        )
    }
}

/// Finds a pattern by slug, title (case-insensitive) or 1-based number.
///
/// # Examples
///
/// ```
/// use forge_workbench::cookbook::find_pattern;
///
/// assert_eq!(find_pattern("brand-compliance-engine").unwrap().title, "Brand Compliance Engine");
/// assert_eq!(find_pattern("1").unwrap().title, "Financial Ratio Analyzer");
/// assert!(find_pattern("unknown").is_none());
/// ```
#[must_use]
pub fn find_pattern(query: &str) -> Option<&'static CookbookPattern> {
    let query = query.trim();
    if let Ok(n) = query.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| PATTERNS.get(i));
    }
    let lowered = query.to_lowercase();
    PATTERNS
        .iter()
        .find(|p| p.slug() == lowered || p.title.to_lowercase() == lowered)
}
