/// Instructions sent with every résumé.
const INSTRUCTIONS: &str = "You are an expert web developer. Based on the following resume text, \
generate a complete, single, self-contained HTML file for a personal portfolio website. \
The HTML file must include all CSS within `<style>` tags and all JavaScript (if any, but prefer \
minimal or no JS for simplicity) within `<script>` tags. \
Do NOT use any external CDN links for libraries like Bootstrap, jQuery, or font providers. \
All resources must be inline. \
The portfolio should look modern and professional. Extract key information like name, contact \
details, summary/objective, skills, experience, education, and projects (if available) from the \
resume text and display them in well-structured sections. \
Make the design responsive. If no specific name is found, use 'User Portfolio'. \
Output ONLY the HTML code starting with `<!DOCTYPE html>` and ending with `</html>`. \
Do not include any explanatory text before or after the HTML code itself.";

/// Build the generation prompt for a résumé.
pub fn portfolio_prompt(resume_text: &str) -> String {
    format!("{INSTRUCTIONS}\n\nResume Text:\n```\n{resume_text}\n```\n\nGenerate the HTML code now:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_resume() {
        let prompt = portfolio_prompt("Jane Doe\nRust engineer");

        assert!(prompt.starts_with("You are an expert web developer."));
        assert!(prompt.contains("Resume Text:\n```\nJane Doe\nRust engineer\n```"));
        assert!(prompt.ends_with("Generate the HTML code now:"));
    }
}
