pub mod controller;
pub mod microphone;
pub mod recognizer;
pub mod view;
