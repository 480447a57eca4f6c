pub mod tank_vis2d;
