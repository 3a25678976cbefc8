pub mod listen;
pub mod llm;
