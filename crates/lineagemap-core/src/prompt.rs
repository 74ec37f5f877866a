//! Instruction template sent to the AI backend.

use crate::types::LineageRequest;

const INSTRUCTIONS: &str = "\
As an expert Data Engineer, analyze the {label} below and extract its column-level data lineage: \
for every target column, identify the source column(s) it is derived from and the transformation applied.

Return ONLY a JSON object with exactly this shape, with no Markdown and no text before or after it:
{\"mappings\": [{\"source_column\": \"<schema.table.column>\", \"target_column\": \"<schema.table.column>\", \
\"transformation\": \"<short transformation name, e.g. SUM, CAST, CASE WHEN, direct>\", \"confidence\": <integer 1-5>}], \
\"transformation_summary\": [\"<distinct transformation type>\"]}

Rules:
- Emit one mapping per (source column, target column) pair; a target derived from two sources gets two mappings.
- Qualify column names with their table (and schema when known) so the same name in different tables stays distinct.
- `transformation_summary` lists every distinct kind of transformation detected \
(e.g. JOIN, SUM(), CAST, CASE WHEN, GROUP BY, LAG, COALESCE, FILTER, MERGE, UNION).
- `confidence` is an integer from 1 to 5 describing how certain you are about the mapping:
  5: directly mapped or clearly defined transformation.
  4: clear transformation that may involve implicit logic.
  3: inferred transformation, minor ambiguities possible.
  2: heavily inferred, significant ambiguities or complex logic.
  1: highly ambiguous or speculative mapping.
- If lineage cannot be extracted, return {\"mappings\": [], \"transformation_summary\": [], \"error\": \"<reason>\"}.

{label} to analyze:
";

/// Assembles the prompt for a request.
///
/// The output depends only on the request, so identical submissions produce
/// identical prompts. The source code is embedded verbatim inside a code fence
/// longer than any backtick run it contains.
pub fn build_prompt(request: &LineageRequest) -> String {
    let source_type = request.source_type();
    let code = request.source_code();
    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);

    let mut prompt = INSTRUCTIONS.replace("{label}", source_type.label());
    prompt.push_str(&fence);
    prompt.push_str(source_type.highlight_language());
    prompt.push('\n');
    prompt.push_str(code);
    if !code.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str(&fence);
    prompt.push('\n');
    prompt
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;

    #[test]
    fn prompt_is_deterministic() {
        let request = LineageRequest::new("SELECT a+b AS total FROM t", SourceType::Sql).unwrap();
        assert_eq!(build_prompt(&request), build_prompt(&request));
    }

    #[test]
    fn prompt_embeds_source_type_and_code() {
        let request =
            LineageRequest::new("df.select(col('a'))", SourceType::Pyspark).unwrap();
        let prompt = build_prompt(&request);
        assert!(prompt.contains("analyze the PySpark below"));
        assert!(prompt.contains("```python\ndf.select(col('a'))\n```\n"));
        assert!(prompt.contains("\"source_column\""));
        assert!(prompt.contains("\"transformation_summary\""));
    }

    #[test]
    fn fence_outgrows_backticks_in_code() {
        let request =
            LineageRequest::new("SELECT 1 -- ````quoted````", SourceType::Sql).unwrap();
        let prompt = build_prompt(&request);
        assert!(prompt.contains("`````sql\n"));
        assert!(prompt.ends_with("`````\n"));
    }

    #[test]
    fn longest_run_counts_consecutive_backticks() {
        assert_eq!(longest_backtick_run("no ticks"), 0);
        assert_eq!(longest_backtick_run("a ` b `` c"), 2);
    }
}
