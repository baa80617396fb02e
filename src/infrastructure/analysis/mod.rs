pub mod vibrato;
