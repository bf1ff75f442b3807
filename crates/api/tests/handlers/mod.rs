mod availability_test;
mod booking_test;
mod schedule_test;
