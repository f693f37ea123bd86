mod apply;
mod inventory;
mod session;
