mod binary;
mod diff_flow;
mod triggers_flow;
