pub mod sociogram;
