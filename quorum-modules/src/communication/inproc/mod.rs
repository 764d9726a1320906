pub mod inproc_messenger;
