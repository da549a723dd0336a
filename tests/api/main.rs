mod existing;
mod health_check;
mod signup;
mod updated;
