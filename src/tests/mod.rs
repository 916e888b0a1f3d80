mod dist;
mod expr;
mod parse;
