pub mod detection_loop;
