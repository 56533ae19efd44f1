use docrag_core::RetrievalResult;

const HEADER: &str = "You are a code assistant. Given the following documentation contexts, \
extract and return *only* the **Python code snippet** that answers the question. \
If no code snippet exists in context, respond \"No example found.\" \
Cite each code block with its context ID.\n\n";

const FENCE: &str = "```";
const ESCAPED_FENCE: &str = "\\`\\`\\`";

/// Header, then each context as `[id]` plus a fenced copy of its content,
/// then the question. Fences inside the content are escaped so they cannot
/// close the wrapper early.
pub fn build_prompt(query: &str, contexts: &[RetrievalResult]) -> String {
    let mut prompt = String::from(HEADER);
    for ctx in contexts {
        let content = ctx.content.replace(FENCE, ESCAPED_FENCE);
        prompt.push_str(&format!("[{}] {FENCE}\n{content}\n{FENCE}\n\n", ctx.id));
    }
    prompt.push_str(&format!("Question: {query}\n\nAnswer (code only):"));
    prompt
}
